#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use recordcheck::config::Config;
use tempfile::TempDir;

pub const SCENARIO_RECORD: &str = "{\"slug\":\"acme\",\"name\":\"Acme\",\"address\":\"Acme\\nMusterstr. 1\\nBerlin\",\"required-elements\":[{\"type\":\"email\"}],\"quality\":\"tested\"}\n";

pub const CLEAN_RECORD: &str = "{\"slug\":\"clean\",\"name\":\"Clean GmbH\",\"address\":\"Clean GmbH Legal\\nHauptstr. 5\\n10115 Berlin\\nGermany\",\"email\":\"privacy@clean.example\"}\n";

pub const CLEAN_AUTHORITY: &str = "{\n    \"slug\": \"bfdi\",\n    \"name\": \"BfDI\",\n    \"address\": \"Graurheindorfer Str. 153\\n53117 Bonn\\nGermany\",\n    \"jurisdiction\": \"DE\"\n}\n";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Scratch dataset laid out like the real repository.
pub struct Dataset {
    dir: TempDir,
}

impl Dataset {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let root = dir.path();
        fs::create_dir_all(root.join("companies")).expect("companies dir");
        fs::create_dir_all(root.join("supervisory-authorities")).expect("authorities dir");
        fs::create_dir_all(root.join("templates").join("en")).expect("templates dir");
        fs::write(root.join("templates/en/access-default.txt"), "Hello").expect("template");
        for schema in ["schema.json", "schema-supervisory-authorities.json"] {
            fs::copy(fixture(schema), root.join(schema)).expect("schema fixture should copy");
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Config {
        Config::with_root(self.root())
    }

    pub fn write_record(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.root().join("companies").join(file_name);
        fs::write(&path, content).expect("record should be written");
        path
    }

    pub fn write_authority(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.root().join("supervisory-authorities").join(file_name);
        fs::write(&path, content).expect("authority should be written");
        path
    }

    pub fn read_record(&self, file_name: &str) -> String {
        fs::read_to_string(self.root().join("companies").join(file_name))
            .expect("record should be readable")
    }
}
