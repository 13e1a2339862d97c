use std::error::Error;
use std::fs;
use std::path::Path;

/// Setup the per-run results directory
pub fn setup_directories(results_dir: &str, clean: bool) -> Result<(), Box<dyn Error>> {
    // If clean flag is set, remove directories left over from previous runs
    if clean {
        remove_previous_results(".")?;
    }

    let results_path = Path::new(results_dir);

    // Create the results directory if it doesn't exist
    if !results_path.exists() {
        fs::create_dir_all(results_path)?;
        log::info!("Created results directory: {}", results_dir);
    }

    Ok(())
}

/// Remove all results directories from previous runs
fn remove_previous_results(parent: &str) -> Result<(), Box<dyn Error>> {
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() && name.starts_with("results_") {
            fs::remove_dir_all(&path)?;
            log::info!("Cleaned previous results directory: {}", name);
        }
    }

    Ok(())
}

/// Check if a file exists
pub fn file_exists(file_path: &str) -> bool {
    Path::new(file_path).exists()
}

/// Count number of files in a directory with specific extension
pub fn count_files(dir_path: &str, extension: &str) -> Result<usize, Box<dyn Error>> {
    let mut count = 0;

    for entry in fs::read_dir(dir_path)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == extension) {
            count += 1;
        }
    }

    Ok(count)
}
