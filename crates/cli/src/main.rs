//! intray CLI entry point
//!
//! Delegates to the library; only error reporting lives here.

use clap::Parser;

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = intray::Cli::parse();

    // `run` drains background hooks before returning, so exiting here
    // never cuts a hook short
    if let Err(e) = intray::run(cli) {
        let miette_error = miette::Report::msg(format!("{e:#}"));
        eprintln!("{miette_error:?}");
        std::process::exit(1);
    }
}
