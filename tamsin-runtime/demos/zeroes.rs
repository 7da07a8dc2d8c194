//! The `zeroes` grammar, compiled by hand against the runtime.
//!
//! ```text
//! main = zeroes & $:eof.
//! zeroes = ("0" & zeroes → E & return zero(E)) | return nil.
//! ```
//!
//! Prints the resulting term and exits with status 0, or prints the failure
//! message to standard error and exits with status 1.

use clap::Parser as ClapParser;
use std::process::ExitCode;
use tamsin_runtime::{Outcome, Runtime, RuntimeError, named, primitives, succeed};
use tamsin_terms::Term;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input text
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,
    /// Input file
    #[arg(short, long)]
    file: Option<String>,
    /// Print the result in re-readable form
    #[arg(short, long)]
    repr: bool,
}

fn zeroes(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let zero = Term::byte(b'0');
    if let Outcome::Success(_) = primitives::expect(rt, &zero)? {
        let e = succeed!(zeroes(rt));
        let t = rt.arena_mut().constructor("zero", [e]);
        return primitives::ret(rt, &t);
    }
    primitives::ret(rt, &Term::NIL)
}

fn main_production(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let t = succeed!(rt.call(&named("zeroes", zeroes)));
    succeed!(primitives::eof(rt));
    Ok(Outcome::Success(t))
}

fn main() -> Result<ExitCode, RuntimeError> {
    env_logger::init();

    let args = Args::parse();
    let input = match (args.text, args.file) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => std::fs::read(&path)?,
        (None, None) => b"0000".to_vec(),
    };

    let mut rt = Runtime::new(input);
    let outcome = rt.call(&named("main", main_production))?;
    log::debug!("{:?}", rt);
    match outcome {
        Outcome::Success(t) => {
            let t = if args.repr {
                primitives::repr(&mut rt, &t)?.term()
            } else {
                t
            };
            primitives::print(&mut rt, &t)?;
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failure(message) => {
            let mut buf = Vec::new();
            rt.arena().flatten_into(&message, &mut buf)?;
            eprintln!("{}", String::from_utf8_lossy(&buf));
            Ok(ExitCode::FAILURE)
        }
    }
}
