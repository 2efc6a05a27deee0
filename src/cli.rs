use clap::Parser;
use std::path::PathBuf;

// Build version with codec info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Frames: PNG sequence + JSON manifest\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Frame-by-frame sprite animation editor
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Project directory (or its sprite.json) to open
    #[arg(value_name = "PROJECT")]
    pub project: Option<PathBuf>,

    /// Start a new blank document of the given size, e.g. 64x64
    #[arg(short = 'n', long = "new", value_name = "WxH", value_parser = parse_size)]
    pub new_size: Option<(u32, u32)>,

    /// Preview frames per second (overrides settings and project)
    #[arg(long = "fps", value_name = "FPS")]
    pub fps: Option<i32>,

    /// Run the preview for N full cycles and log every presented frame
    #[arg(long = "play-cycles", value_name = "N")]
    pub play_cycles: Option<u32>,

    /// Export frames as a numbered PNG sequence into DIR
    #[arg(short = 'e', long = "export", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Save the document as a project directory
    #[arg(short = 's', long = "save", value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Enable debug logging to file (default: sprited.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

/// Parse "WxH" into a canvas size
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let width: u32 = w.trim().parse().map_err(|_| format!("bad width '{}'", w))?;
    let height: u32 = h.trim().parse().map_err(|_| format!("bad height '{}'", h))?;
    if width == 0 || height == 0 {
        return Err(format!("canvas size must be non-zero, got {}x{}", width, height));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x32"), Ok((64, 32)));
        assert_eq!(parse_size("8X8"), Ok((8, 8)));
        assert!(parse_size("64").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    /// Test: Full command line parses
    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "sprited", "walk", "--fps", "8", "--play-cycles", "2", "-e", "out", "-vv",
        ])
        .unwrap();
        assert_eq!(args.project, Some(PathBuf::from("walk")));
        assert_eq!(args.fps, Some(8));
        assert_eq!(args.play_cycles, Some(2));
        assert_eq!(args.export_dir, Some(PathBuf::from("out")));
        assert_eq!(args.verbosity, 2);
        assert!(args.log_file.is_none());

        let args = Args::try_parse_from(["sprited", "--new", "16x16", "--log"]).unwrap();
        assert_eq!(args.new_size, Some((16, 16)));
        assert_eq!(args.log_file, Some(None));
    }
}
