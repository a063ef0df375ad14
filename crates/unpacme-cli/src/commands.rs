//! Subcommands of the `unpacme` tool.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print current quota usage
    Quota,

    /// Search for previous analyses of a SHA256 hash
    Search {
        /// SHA256 of the file to look up
        sha256: String,
    },

    /// Download a file by SHA256 hash
    Download {
        /// SHA256 of the file to download
        sha256: String,
        /// Output file name, defaults to the hash
        #[arg(long)]
        file_name: Option<PathBuf>,
    },

    /// List analysis entries for recently submitted samples
    Feed {
        /// Only list entries with unpacked children
        #[arg(long)]
        children_only: bool,
        /// Only list completed entries
        #[arg(long)]
        completed_only: bool,
        /// Only list entries with an identified malware family
        #[arg(long)]
        malware_only: bool,
        /// Only print SHA256 hashes
        #[arg(long)]
        sha256: bool,
    },

    /// List your past submissions
    History,

    /// Check the status of a submission
    Status {
        /// ID returned when the file was uploaded
        upload_id: String,
        /// List the source and unpacked files of a completed job
        #[arg(short, long)]
        list: bool,
        /// Print the full result document of a completed job
        #[arg(short, long)]
        details: bool,
        /// Download every unpacked file of a completed job
        #[arg(short = 'u', long)]
        download_unpacked_files: bool,
    },

    /// Upload files for unpacking and analysis
    Upload {
        /// Files to upload
        #[arg(required = true)]
        file_names: Vec<PathBuf>,
        /// Skip the quota check
        #[arg(short, long)]
        force: bool,
        /// Print the upload IDs and exit without polling
        #[arg(long)]
        print_id: bool,
        /// Seconds between status checks
        #[arg(long, default_value_t = 20)]
        poll_interval: u64,
        /// Give up after this many status checks per file
        #[arg(long)]
        max_polls: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use crate::parser::Cli;
    use clap::Parser;

    use super::*;

    #[test]
    fn test_status_flags() {
        let cli = Cli::parse_from(["unpacme", "status", "Fk2xQ", "-l", "-u"]);
        match cli.command {
            Commands::Status {
                upload_id,
                list,
                details,
                download_unpacked_files,
            } => {
                assert_eq!(upload_id, "Fk2xQ");
                assert!(list);
                assert!(!details);
                assert!(download_unpacked_files);
            }
            _ => panic!("expected status command"),
        }
    }

    #[test]
    fn test_upload_defaults() {
        let cli = Cli::parse_from(["unpacme", "upload", "a.exe", "b.dll"]);
        match cli.command {
            Commands::Upload {
                file_names,
                force,
                print_id,
                poll_interval,
                max_polls,
            } => {
                assert_eq!(file_names, vec![PathBuf::from("a.exe"), PathBuf::from("b.dll")]);
                assert!(!force);
                assert!(!print_id);
                assert_eq!(poll_interval, 20);
                assert_eq!(max_polls, None);
            }
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn test_upload_requires_files() {
        assert!(Cli::try_parse_from(["unpacme", "upload"]).is_err());
    }

    #[test]
    fn test_feed_filters() {
        let cli = Cli::parse_from(["unpacme", "feed", "--malware-only", "--sha256"]);
        assert!(matches!(
            cli.command,
            Commands::Feed {
                children_only: false,
                completed_only: false,
                malware_only: true,
                sha256: true,
            }
        ));
    }

    #[test]
    fn test_download_file_name() {
        let cli = Cli::parse_from(["unpacme", "download", "abc", "--file-name", "out.bin"]);
        match cli.command {
            Commands::Download { sha256, file_name } => {
                assert_eq!(sha256, "abc");
                assert_eq!(file_name, Some(PathBuf::from("out.bin")));
            }
            _ => panic!("expected download command"),
        }
    }
}
