pub mod test_data;
