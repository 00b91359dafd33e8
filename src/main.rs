//=========================================================================
// aetheric
//
// Opens a window and animates the gradient pattern until it is closed.
//
// Logging is configured through `RUST_LOG` (default: `info`), e.g.
//   RUST_LOG=platform=debug,core::frame_loop=trace aetheric
//
//=========================================================================

use std::process::ExitCode;

use aetheric_platform::{EngineBuilder, GradientPattern, LoopExit};
use env_logger::Env;
use log::{error, info, warn};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let engine = EngineBuilder::new().build();

    match engine.run(GradientPattern::new()) {
        Ok(LoopExit::Closed { frames }) => {
            info!("Window closed after {} frames", frames);
            ExitCode::SUCCESS
        }
        Ok(exit @ LoopExit::Quit { .. }) => {
            warn!("Quit requested after {} frames", exit.frames());
            std::process::exit(exit.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
