//! composition-inspector - browse a composition document in the terminal.
//!
//! ```text
//! composition-inspector                     # first bundled example
//! composition-inspector song.json           # local file
//! composition-inspector https://host/x.json # fetched, then stored
//! composition-inspector --list-examples
//! ```

use std::io;

use clap::Parser;

use composition_inspector::config::{Cli, InspectorConfig};
use composition_inspector::document::{DocumentLoader, FileStorage, HttpFetcher, bundled};
use composition_inspector::inspector::{LoadRequest, LoadWorker};
use composition_inspector::logging;
use composition_inspector::pipeline::{TerminalSize, mount};

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.list_examples {
        for key in bundled::keys() {
            println!("{key}");
        }
        return Ok(());
    }

    logging::init(cli.log_file.as_deref(), &cli.log_level)?;
    let config = InspectorConfig::from(&cli);

    let storage = FileStorage::open(config.store_path.clone())?;
    let loader = DocumentLoader::new(storage, HttpFetcher::default());
    let worker = LoadWorker::spawn(loader)?;

    let initial = match &config.source {
        Some(source) => LoadRequest::from_source(source),
        None => LoadRequest::Key(bundled::keys().remove(0)),
    };

    let mut app = mount(config, worker, TerminalSize::detect());
    app.request(initial);
    let result = app.run();
    if let Err(err) = &result {
        tracing::error!(%err, "inspector stopped");
    }
    result
}
