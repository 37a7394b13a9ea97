#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use fastyet_core::{Profile, Repo, ResultFile, SystemInfo};

/// A catalog entry with placeholder metadata.
pub fn repo(name: &str, min_version: &str) -> Repo {
    Repo {
        name: name.to_string(),
        sub_directory: String::new(),
        url: format!("https://github.com/example/{name}"),
        touch_file: "src/lib.rs".to_string(),
        output: name.to_string(),
        commit: "a".repeat(40),
        min_version: min_version.to_string(),
    }
}

/// Builder for result documents.
pub struct ResultFileBuilder {
    cores: u32,
    profiles: BTreeMap<String, Profile>,
}

impl ResultFileBuilder {
    pub fn new(cores: u32) -> Self {
        Self {
            cores,
            profiles: BTreeMap::new(),
        }
    }

    pub fn timing(mut self, repo: &str, key: &str, samples: &[f64]) -> Self {
        self.profiles
            .entry(repo.to_string())
            .or_default()
            .compile_times
            .insert(key.to_string(), samples.to_vec());
        self
    }

    pub fn size(mut self, repo: &str, key: &str, bytes: u64) -> Self {
        self.profiles
            .entry(repo.to_string())
            .or_default()
            .output_sizes
            .insert(key.to_string(), bytes);
        self
    }

    pub fn build(self) -> ResultFile {
        ResultFile {
            system_info: SystemInfo {
                num_cores: self.cores,
                num_physical_cores: self.cores / 2,
                cpu_model: format!("Test CPU ({} threads)", self.cores),
            },
            profiles: self.profiles,
        }
    }
}

/// Two machines measuring `hello` at two versions.
pub fn two_machine_results() -> Vec<ResultFile> {
    vec![
        ResultFileBuilder::new(4)
            .timing("hello", "1.42.0,Check,Clean", &[4000.0, 4200.0, 3800.0])
            .timing("hello", "1.42.0,Debug,Incremental", &[900.0, 1100.0])
            .timing("hello", "1.43.0,Check,Clean", &[3000.0, 3100.0, 2900.0])
            .size("hello", "1.42.0,Debug", 4 * 1_048_576)
            .size("hello", "1.43.0,Debug", 3 * 1_048_576)
            .size("hello", "1.43.0,Release", 1_048_576)
            .build(),
        ResultFileBuilder::new(8)
            .timing("hello", "1.42.0,Check,Clean", &[2000.0, 2100.0])
            .timing("hello", "1.43.0,Check,Clean", &[1500.0])
            .timing("hello", "1.43.0,Release,PatchIncremental", &[700.0, 800.0])
            .size("hello", "1.43.0,Debug", 5 * 1_048_576)
            .build(),
    ]
}

/// Write a catalog and result documents the way the collector lays them out.
pub fn write_data_dir(dir: &Path, catalog: &[Repo], results: &[ResultFile]) {
    fs::write(dir.join("repos.json"), serde_json::to_string_pretty(catalog).unwrap()).unwrap();
    for (i, result) in results.iter().enumerate() {
        let name = format!("results-{}-{i:04}.json", result.system_info.num_cores);
        fs::write(dir.join(name), serde_json::to_string(result).unwrap()).unwrap();
    }
}
