use std::io;

use shmembench::helper::exit_on_error;
use shmembench_cli::Opt;
use structopt::StructOpt;

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    let config = exit_on_error(opt.config());
    log::debug!("configuration:\n{}", config);
    let stdout = io::stdout();
    exit_on_error(shmembench_cli::run(&config, &mut stdout.lock()));
}
