use std::path::PathBuf;

/// Values used when neither the command line nor the configuration file sets a key.
///
/// Layout and method labels come from the library's own `Default` impls; this holds the
/// pipeline constants that have no sensible library default.
pub struct DefaultsConfig {
    pub tolerance_kcal: f64,
    pub min_members: usize,
    pub include_charged: bool,
    pub database_file: PathBuf,
    pub archive_dir: PathBuf,
    pub folder_prefix: String,
    pub required_files: Vec<String>,
    pub coord_file: String,
    pub geometry_file: String,
    pub script_file: String,
    pub sampling_program: String,
    pub sampling_args: Vec<String>,
    pub structure_file: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tolerance_kcal: 0.01,
            min_members: 3,
            include_charged: false,
            database_file: PathBuf::from("energies.json"),
            archive_dir: PathBuf::from("res_archive"),
            folder_prefix: "RNDCONF".to_string(),
            required_files: ["energy", "control", "coord", "ridft.out", "gradient", "basis"]
                .map(String::from)
                .to_vec(),
            coord_file: "coord".to_string(),
            geometry_file: "struc.xyz".to_string(),
            script_file: "res.sh".to_string(),
            sampling_program: "crest".to_string(),
            sampling_args: [
                "--squick", "--T", "{threads}", "--mddump", "250", "--mdlen", "x0.75",
            ]
            .map(String::from)
            .to_vec(),
            structure_file: "opt.xyz".to_string(),
        }
    }
}
