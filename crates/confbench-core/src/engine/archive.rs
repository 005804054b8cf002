use super::config::{ArchiveConfig, ArchiveMode, EnsembleLayout};
use super::convert::GeometryConverter;
use super::error::EngineError;
use super::loader::conformer_dir;
use crate::core::models::database::MoleculeEnergies;
use crate::core::models::ids::{ConformerIndex, MoleculeId};
use crate::core::models::method::MethodSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An archive under construction: the resolved archive directory plus its settings.
pub struct ArchiveBuilder<'a, C: GeometryConverter> {
    root: &'a Path,
    layout: &'a EnsembleLayout,
    config: &'a ArchiveConfig,
    converter: &'a C,
    archive_dir: PathBuf,
}

/// What one molecule contributed to the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivedMolecule {
    pub folders: usize,
    pub script_lines: usize,
}

impl<'a, C: GeometryConverter> ArchiveBuilder<'a, C> {
    /// Creates the archive directory and writes the driver script header.
    ///
    /// An existing archive is removed in [`ArchiveMode::Wipe`] and is fatal in
    /// [`ArchiveMode::Keep`].
    pub fn create(
        root: &'a Path,
        layout: &'a EnsembleLayout,
        config: &'a ArchiveConfig,
        methods: &MethodSet,
        converter: &'a C,
    ) -> Result<Self, EngineError> {
        let archive_dir = root.join(&config.archive_dir);
        if archive_dir.exists() {
            match config.mode {
                ArchiveMode::Keep => {
                    return Err(EngineError::ArchiveExists { path: archive_dir });
                }
                ArchiveMode::Wipe => {
                    warn!(path = %archive_dir.display(), "Archive exists. Wiping it.");
                    fs::remove_dir_all(&archive_dir).map_err(EngineError::io(&archive_dir))?;
                }
            }
        }
        fs::create_dir_all(&archive_dir).map_err(EngineError::io(&archive_dir))?;

        let script = archive_dir.join(&config.script_file);
        fs::write(&script, script_header(methods)).map_err(EngineError::io(&script))?;

        Ok(Self {
            root,
            layout,
            config,
            converter,
            archive_dir,
        })
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn folder_name(&self, molecule: MoleculeId, k: usize) -> String {
        format!("{}_{}_{}", self.config.folder_prefix, molecule, k)
    }

    /// Archives the minimum as folder 1 and the remaining conformers as folders 2..k, then
    /// appends one driver line per non-minimum conformer.
    pub fn add_molecule(
        &self,
        molecule: MoleculeId,
        energies: &MoleculeEnergies,
    ) -> Result<ArchivedMolecule, EngineError> {
        let mut required = self.config.required_files.clone();
        if energies.charge != 0 {
            warn!(molecule, charge = energies.charge, "Charge is not zero.");
            required.push(self.config.charge_file.clone());
        }

        let first = self.folder_name(molecule, 1);
        self.build_folder(molecule, energies.lowest_conformer, &first, &required)?;

        let mut lines = Vec::with_capacity(energies.len());
        for (offset, (&conformer, &relative)) in energies
            .conformer_index
            .iter()
            .zip(&energies.reference)
            .enumerate()
        {
            let this = self.folder_name(molecule, offset + 2);
            self.build_folder(molecule, conformer, &this, &required)?;
            lines.push(driver_line(&first, &this, relative));
        }

        let script = self.archive_dir.join(&self.config.script_file);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&script)
            .map_err(EngineError::io(&script))?;
        for line in &lines {
            writeln!(file, "{}", line).map_err(EngineError::io(&script))?;
        }

        debug!(molecule, folders = lines.len() + 1, "Molecule archived.");
        Ok(ArchivedMolecule {
            folders: lines.len() + 1,
            script_lines: lines.len(),
        })
    }

    fn build_folder(
        &self,
        molecule: MoleculeId,
        conformer: ConformerIndex,
        name: &str,
        required: &[String],
    ) -> Result<(), EngineError> {
        let source = conformer_dir(self.root, molecule, conformer).join(&self.layout.reference_dir);
        let folder = self.archive_dir.join(name);
        let target = folder.join(&self.layout.reference_dir);
        fs::create_dir_all(&target).map_err(EngineError::io(&target))?;

        for file in required {
            let from = source.join(file);
            if !from.is_file() {
                return Err(EngineError::MissingArchiveSource { path: from });
            }
            let to = target.join(file);
            fs::copy(&from, &to).map_err(EngineError::io(&to))?;
        }

        let coord_from = source.join(&self.config.coord_file);
        if !coord_from.is_file() {
            return Err(EngineError::MissingArchiveSource { path: coord_from });
        }
        let coord = folder.join(&self.config.coord_file);
        fs::copy(&coord_from, &coord).map_err(EngineError::io(&coord))?;

        let geometry = folder.join(&self.config.geometry_file);
        self.converter
            .convert(&coord, &geometry)
            .map_err(|e| EngineError::Conversion {
                path: coord.clone(),
                reason: e.to_string(),
            })
    }
}

fn script_header(methods: &MethodSet) -> String {
    format!(
        r#"#!/bin/bash

# {} // {} at CREST({}) conformers

if [ "$TMER" == "" ]
then
   tmer=tmer2++
else
   tmer=$TMER
fi
f=$1
if [ -z $2 ]
then
   w=0
else
   w=$2
fi
"#,
        methods.reference, methods.cheap_b, methods.cheap_a
    )
}

fn driver_line(first: &str, this: &str, relative_energy: f64) -> String {
    format!(
        "$tmer {:>25}$f {:>25}$f   x    -1  1   $w{:10.6}",
        format!("{}/", first),
        format!("{}/", this),
        relative_energy
    )
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use crate::engine::config::ArchiveConfigBuilder;
    use tempfile::tempdir;

    fn config(mode: ArchiveMode) -> ArchiveConfig {
        ArchiveConfigBuilder::new()
            .archive_dir(PathBuf::from("res_archive"))
            .folder_prefix("RNDCONF")
            .required_files(ARCHIVED_FILES.iter().map(|s| s.to_string()).collect())
            .coord_file("coord")
            .geometry_file("struc.xyz")
            .script_file("res.sh")
            .mode(mode)
            .build()
            .unwrap()
    }

    fn energies(charge: i32) -> MoleculeEnergies {
        MoleculeEnergies {
            lowest_conformer: 4,
            conformer_index: vec![1, 9],
            reference: vec![0.25, 1.5],
            cheap_a: vec![0.3, 1.2],
            cheap_b: vec![0.1, 1.7],
            natoms: 6,
            charge,
            nconf: 10,
            name: None,
        }
    }

    fn script_lines(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("res.sh"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn minimum_plus_two_builds_three_folders_and_two_lines() {
        let root = tempdir().unwrap();
        for conf in [4, 1, 9] {
            write_reference_outputs(root.path(), 702, conf, &[]);
        }
        let layout = EnsembleLayout::default();
        let config = config(ArchiveMode::Keep);
        let converter = CopyConverter::default();
        let builder =
            ArchiveBuilder::create(root.path(), &layout, &config, &MethodSet::default(), &converter)
                .unwrap();
        let header_len = script_lines(builder.archive_dir()).len();

        let archived = builder.add_molecule(702, &energies(0)).unwrap();
        assert_eq!(
            archived,
            ArchivedMolecule {
                folders: 3,
                script_lines: 2
            }
        );

        let archive = builder.archive_dir();
        let mut folders: Vec<_> = fs::read_dir(archive)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|n| n.starts_with("RNDCONF"))
            .collect();
        folders.sort();
        assert_eq!(folders, vec!["RNDCONF_702_1", "RNDCONF_702_2", "RNDCONF_702_3"]);

        let minimum = archive.join("RNDCONF_702_1");
        assert_eq!(
            fs::read_to_string(minimum.join("TZ/energy")).unwrap(),
            "energy of 702/4\n"
        );
        assert!(minimum.join("coord").is_file());
        assert!(minimum.join("struc.xyz").is_file());
        assert!(!minimum.join("TZ/.CHRG").exists());
        assert_eq!(
            fs::read_to_string(archive.join("RNDCONF_702_3/coord")).unwrap(),
            "coord of 702/9\n"
        );
        assert_eq!(converter.calls.borrow().len(), 3);

        let lines = script_lines(archive);
        assert_eq!(lines.len(), header_len + 2);
        assert_eq!(
            lines[header_len],
            format!(
                "$tmer {:>25}$f {:>25}$f   x    -1  1   $w  0.250000",
                "RNDCONF_702_1/", "RNDCONF_702_2/"
            )
        );
        assert!(lines[header_len + 1].ends_with("$w  1.500000"));
    }

    #[test]
    fn script_header_is_written_once() {
        let root = tempdir().unwrap();
        let layout = EnsembleLayout::default();
        let config = config(ArchiveMode::Keep);
        let methods = MethodSet::default();
        let converter = CopyConverter::default();
        let builder =
            ArchiveBuilder::create(root.path(), &layout, &config, &methods, &converter).unwrap();
        let lines = script_lines(builder.archive_dir());
        assert_eq!(lines[0], "#!/bin/bash");
        assert_eq!(lines[2], "# wB97X-D4 // GP3 at CREST(GFN2) conformers");
        assert_eq!(lines.last().unwrap(), "fi");
    }

    #[test]
    fn missing_required_file_aborts_naming_the_path() {
        let root = tempdir().unwrap();
        for conf in [4, 1, 9] {
            write_reference_outputs(root.path(), 702, conf, &[]);
        }
        let missing = conformer_dir(root.path(), 702, 9).join("TZ").join("gradient");
        fs::remove_file(&missing).unwrap();

        let layout = EnsembleLayout::default();
        let config = config(ArchiveMode::Keep);
        let converter = CopyConverter::default();
        let builder =
            ArchiveBuilder::create(root.path(), &layout, &config, &MethodSet::default(), &converter)
                .unwrap();

        match builder.add_molecule(702, &energies(0)) {
            Err(EngineError::MissingArchiveSource { path }) => assert_eq!(path, missing),
            other => panic!("Expected MissingArchiveSource, got {:?}", other),
        }
    }

    #[test]
    fn charged_molecule_requires_the_charge_file() {
        let root = tempdir().unwrap();
        for conf in [4, 1, 9] {
            write_reference_outputs(root.path(), 5, conf, &[".CHRG"]);
        }
        for conf in [2, 3] {
            write_reference_outputs(root.path(), 6, conf, &[]);
        }
        let neutral = MoleculeEnergies {
            lowest_conformer: 2,
            conformer_index: vec![3],
            reference: vec![0.5],
            ..energies(0)
        };

        let layout = EnsembleLayout::default();
        let config = config(ArchiveMode::Keep);
        let converter = CopyConverter::default();
        let builder =
            ArchiveBuilder::create(root.path(), &layout, &config, &MethodSet::default(), &converter)
                .unwrap();

        builder.add_molecule(5, &energies(1)).unwrap();
        assert!(builder.archive_dir().join("RNDCONF_5_2/TZ/.CHRG").is_file());

        // the charge marker must not be demanded of later neutral molecules
        builder.add_molecule(6, &neutral).unwrap();
        assert!(!builder.archive_dir().join("RNDCONF_6_1/TZ/.CHRG").exists());
    }

    #[test]
    fn existing_archive_is_fatal_in_keep_mode_and_replaced_in_wipe_mode() {
        let root = tempdir().unwrap();
        let stale = root.path().join("res_archive").join("stale");
        fs::create_dir_all(&stale).unwrap();
        let layout = EnsembleLayout::default();
        let converter = CopyConverter::default();

        let keep = config(ArchiveMode::Keep);
        let result =
            ArchiveBuilder::create(root.path(), &layout, &keep, &MethodSet::default(), &converter);
        assert!(matches!(result, Err(EngineError::ArchiveExists { .. })));
        assert!(stale.exists());

        let wipe = config(ArchiveMode::Wipe);
        ArchiveBuilder::create(root.path(), &layout, &wipe, &MethodSet::default(), &converter)
            .unwrap();
        assert!(!stale.exists());
        assert!(root.path().join("res_archive/res.sh").is_file());
    }

    #[test]
    fn conversion_failure_is_fatal() {
        let root = tempdir().unwrap();
        write_reference_outputs(root.path(), 8, 4, &[]);
        let layout = EnsembleLayout::default();
        let config = config(ArchiveMode::Keep);
        let builder = ArchiveBuilder::create(
            root.path(),
            &layout,
            &config,
            &MethodSet::default(),
            &FailingConverter,
        )
        .unwrap();
        let single = MoleculeEnergies {
            conformer_index: vec![],
            reference: vec![],
            cheap_a: vec![],
            cheap_b: vec![],
            ..energies(0)
        };

        let result = builder.add_molecule(8, &single);
        assert!(matches!(result, Err(EngineError::Conversion { .. })));
    }
}
