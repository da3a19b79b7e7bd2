use clap::Parser;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::wad::output_dir_for;

#[derive(Parser, Debug)]
#[command(name = "wadextract")]
#[command(version)]
#[command(about = "Extract every lump of a DOOM WAD archive into its own file", long_about = None)]
#[command(after_help = "Examples:\n  \
  wadextract doom2.wad              extract into \"doom2.wad Files\"\n  \
  wadextract -d out a.wad b.wad     extract into out/\"a.wad Files\" and out/\"b.wad Files\"\n  \
  wadextract -v mymap.wad           show offsets and sizes of every lump")]
pub struct Cli {
    /// WAD archive path(s)
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// List lump names (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List lumps verbosely with offsets and sizes
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Create output directories inside DIR
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_listing(&self) -> bool {
        self.list || self.verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default `tracing` filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.is_very_quiet() { "error" } else { "warn" }
    }

    /// Where the lumps of `archive` are written
    pub fn output_dir(&self, archive: &Path) -> PathBuf {
        output_dir_for(archive, self.extract_dir.as_deref())
    }

    /// Find archives whose output directory an earlier argument already owns.
    ///
    /// Each output directory belongs to exactly one archive; the first one on
    /// the command line keeps it. Listing writes nothing, so it never conflicts.
    ///
    /// # Returns
    ///
    /// One [`OutputConflict`] per rejected archive, in argument order.
    pub fn output_conflicts(&self) -> Vec<OutputConflict> {
        if self.is_listing() {
            return Vec::new();
        }

        let mut owners: HashMap<PathBuf, &PathBuf> = HashMap::new();
        let mut conflicts = Vec::new();
        for (index, archive) in self.files.iter().enumerate() {
            let output_dir = self.output_dir(archive);
            match owners.get(&output_dir) {
                Some(owner) => conflicts.push(OutputConflict {
                    index,
                    archive: archive.clone(),
                    owner: (*owner).clone(),
                    output_dir,
                }),
                None => {
                    owners.insert(output_dir, archive);
                }
            }
        }
        conflicts
    }
}

/// An archive that would extract into a directory another archive owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConflict {
    /// Position of the rejected archive among the `FILE` arguments
    pub index: usize,
    pub archive: PathBuf,
    pub owner: PathBuf,
    pub output_dir: PathBuf,
}

impl fmt::Display for OutputConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "output directory {} is already used by {}",
            self.output_dir.display(),
            self.owner.display()
        )
    }
}
