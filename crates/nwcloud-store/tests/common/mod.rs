use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <artifactId>demo</artifactId>
    <packaging>war</packaging>
</project>
"#;

/// Write `contents` to `relative` under `root`, creating directories
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A temp project holding only a build descriptor
#[allow(dead_code)]
pub fn maven_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "pom.xml", POM);
    dir
}
