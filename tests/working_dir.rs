//! Changes the process working directory, so it lives in its own test binary.
use {
    modlog::LoggerBuilder,
    std::{env, fs, io},
};

#[test]
fn relative_directory_is_fixed_at_build() {
    let original = env::current_dir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    env::set_current_dir(first.path()).unwrap();
    let logger = LoggerBuilder::new("Rel").directory("logs").console(io::sink()).build();
    let expected = env::current_dir().unwrap().join("logs").join("Rel.log");

    env::set_current_dir(second.path()).unwrap();
    logger.info("run", "after chdir");
    env::set_current_dir(&original).unwrap();

    let path = logger.log_file().unwrap();
    assert!(path.is_absolute(), "{}", path.display());
    assert_eq!(path, expected);
    let contents = fs::read_to_string(path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(!second.path().join("logs").exists());
}
