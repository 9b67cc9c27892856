use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

use tile_fill::cli::Args;
use tile_fill::logger::{self, Logger};
use tile_fill::persistence::{FileStore, MemoryStore, StateStore, STATE_KEY};
use tile_fill::render::Renderer;
use tile_fill::session::Session;

fn main() {
    let args = Args::parse();
    Logger::init(args.verbosity(), args.no_color);

    if let Err(e) = run(args) {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.validate()?;

    let store: Box<dyn StateStore> = match &config.state_dir {
        Some(dir) => Box::new(FileStore::new(dir.clone())),
        None => Box::new(MemoryStore::new()),
    };
    let mut session = Session::open(config.session.clone(), store)?;

    for m in &config.moves {
        session
            .drag(m.index, m.position, Instant::now())
            .with_context(|| format!("Failed to move vertex {}", m.index))?;
    }

    let outcome = session.flush()?;
    if outcome.saved {
        if let Some(dir) = &config.state_dir {
            let path = FileStore::new(dir.clone()).path_for(STATE_KEY);
            logger::output(&path.display().to_string());
        }
    }

    let active = session.model().active_tiles();
    logger::info(&format!("{} active tiles", active.len()));

    if !logger::is_quiet() {
        if config.list {
            for key in active.iter() {
                println!("{},{}", key.col, key.row);
            }
        } else {
            print!("{}", session.grid().to_ascii());
        }
    }

    if let Some(path) = &config.png {
        let mut renderer = Renderer::new(config.render.clone(), session.grid())?;
        renderer.render(session.grid(), session.model().polygon());
        renderer
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        logger::output(&path.display().to_string());
    }

    Ok(())
}
