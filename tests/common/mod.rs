use std::fs;
use std::io::Write;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A throwaway fixture account: a manifest plus deployment packages on
/// disk, scanned through `--fixtures` instead of AWS.
pub struct TestEnv {
    tmp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.tmp.path()
    }

    /// `functions.json` listing each function as (name, runtime, package
    /// file). `None` for the package leaves the field out of the manifest.
    pub fn write_manifest(&self, entries: &[(&str, &str, Option<&str>)]) {
        let functions: Vec<_> = entries
            .iter()
            .map(|(name, runtime, package)| match package {
                Some(package) => serde_json::json!({
                    "name": name,
                    "runtime": runtime,
                    "package": package,
                }),
                None => serde_json::json!({"name": name, "runtime": runtime}),
            })
            .collect();
        fs::write(
            self.dir().join("functions.json"),
            serde_json::to_string_pretty(&functions).expect("serialize manifest"),
        )
        .expect("write manifest");
    }

    /// A zip deployment package holding the given (path, content) entries.
    pub fn write_package(&self, file_name: &str, files: &[(&str, &str)]) {
        let out = fs::File::create(self.dir().join(file_name)).expect("create package file");
        let mut zw = zip::ZipWriter::new(out);
        let opts = SimpleFileOptions::default();
        for (path, content) in files {
            zw.start_file(*path, opts).expect("add package entry");
            zw.write_all(content.as_bytes()).expect("write package entry");
        }
        zw.finish().expect("finish package");
    }

    /// A package file that is not a valid zip.
    pub fn write_raw_package(&self, file_name: &str, bytes: &[u8]) {
        fs::write(self.dir().join(file_name), bytes).expect("write package file");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = bin();
        cmd.arg("--fixtures").arg(self.dir());
        cmd
    }
}

pub fn bin() -> Command {
    cargo_bin_cmd!("vendored-scan")
}
