use argh::FromArgs;
use std::{path::PathBuf, time::Instant};

use bandconv::imgproc::{
    filter::{self, FilterKind},
    parallel::ExecutionStrategy,
};
use bandconv::io::pgm;

#[derive(FromArgs, Debug)]
/// Apply a 3x3 convolution filter to a PGM image.
/// Filter types: sobel, blur, sharpen
struct Args {
    /// the filter to apply: sobel, blur or sharpen
    #[argh(positional)]
    filter: FilterKind,

    /// path to the input PGM image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output PGM image
    #[argh(positional)]
    output: PathBuf,

    /// number of worker threads, defaults to the available cores minus one
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// process the whole image on the main thread
    #[argh(switch)]
    serial: bool,
}

impl Args {
    fn strategy(&self) -> Result<ExecutionStrategy, Box<dyn std::error::Error>> {
        match (self.serial, self.threads) {
            (true, Some(_)) => Err("--serial and --threads cannot be combined".into()),
            (true, None) => Ok(ExecutionStrategy::Serial),
            (false, Some(n)) => Ok(ExecutionStrategy::Fixed(n)),
            (false, None) => Ok(ExecutionStrategy::Auto),
        }
    }
}

fn main() {
    // timing is reported at info, override with RUST_LOG
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let strategy = args.strategy()?;

    // read the image
    let image = pgm::read_image_pgm_mono8(&args.input)?;
    log::debug!(
        "loaded {} ({}x{})",
        args.input.display(),
        image.width(),
        image.height()
    );

    // convolve the image band by band
    let start = Instant::now();
    let filtered = filter::apply_filter(&image, &args.filter.kernel(), strategy)?;
    log::info!(
        "{} convolution with {:?} took {:?}",
        args.filter,
        strategy,
        start.elapsed()
    );

    // NOTE: the output is only written once the whole image is filtered
    pgm::write_image_pgm_mono8(&args.output, &filtered)?;
    log::debug!("saved {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, argh::EarlyExit> {
        Args::from_args(&["bandconv-cli"], args)
    }

    #[test]
    fn test_parse_args() -> Result<(), Box<dyn std::error::Error>> {
        let args = parse(&["blur", "in.pgm", "out.pgm"]).map_err(|e| e.output)?;
        assert_eq!(args.filter, FilterKind::Blur);
        assert_eq!(args.input, PathBuf::from("in.pgm"));
        assert_eq!(args.strategy()?, ExecutionStrategy::Auto);

        let args = parse(&["sobel", "in.pgm", "out.pgm", "-t", "4"]).map_err(|e| e.output)?;
        assert_eq!(args.strategy()?, ExecutionStrategy::Fixed(4));

        let args = parse(&["sharpen", "in.pgm", "out.pgm", "--serial"]).map_err(|e| e.output)?;
        assert_eq!(args.strategy()?, ExecutionStrategy::Serial);

        let args = parse(&["sharpen", "a", "b", "--serial", "--threads", "2"])
            .map_err(|e| e.output)?;
        assert!(args.strategy().is_err());
        Ok(())
    }

    #[test]
    fn test_parse_rejects_unknown_filter() {
        assert!(parse(&["invalid", "in.pgm", "out.pgm"]).is_err());
        assert!(parse(&["blur", "in.pgm"]).is_err());
    }

    #[test]
    fn test_run_reports_errors() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let input = tmp_dir.path().join("input.pgm");
        let output = tmp_dir.path().join("output.pgm");
        let image = bandconv::image::Image::<u8, 1>::from_size_val([4, 3].into(), 90)?;
        pgm::write_image_pgm_mono8(&input, &image)?;

        let input = input.to_string_lossy().into_owned();
        let output = output.to_string_lossy().into_owned();
        let (input, output) = (input.as_str(), output.as_str());

        let args = parse(&["blur", input, output, "-t", "2"]).map_err(|e| e.output)?;
        run(&args)?;
        assert_eq!(pgm::read_image_pgm_mono8(output)?.size(), image.size());

        let too_many = usize::MAX.to_string();
        let args = parse(&["blur", input, output, "-t", too_many.as_str()])
            .map_err(|e| e.output)?;
        let err = run(&args).err().ok_or("expected an invalid thread count")?;
        assert!(err.to_string().starts_with("thread count must be in"));

        let args = parse(&["blur", "does/not/exist.pgm", output]).map_err(|e| e.output)?;
        let err = run(&args).err().ok_or("expected a missing file")?;
        assert!(err.to_string().starts_with("File does not exist"));
        Ok(())
    }
}
