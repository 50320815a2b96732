//! Exercises the public API end to end: point it at a file or a directory
//! and it writes `<name>.torrent` next to the current directory. Not part
//! of the engine's contract — a thin proof that the crates actually link
//! together and produce a parseable file, the way a picker/CLI wrapper
//! would drive them.

use std::env;
use std::path::Path;

use forge_metainfo::pipeline::ProgressCallbacks;
use forge_metainfo::{file_entry, size, Engine, PieceLength, UiParams};

fn main() {
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: demo-create-torrent <path> [tracker-announce-url]");
        std::process::exit(1);
    };
    let tracker = args.next().unwrap_or_default();

    let path = Path::new(&path);
    let single_file = path.is_file();
    let files = file_entry::walk_directory(path).expect("failed to read input path");
    let total_size: u64 = files.iter().map(|f| f.size).sum();

    let name = if single_file {
        files.first().and_then(|f| f.file_name()).unwrap_or("output").to_owned()
    } else {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_owned())
    };

    log::info!("building torrent for {} ({})", name, size::format_bytes(total_size));

    let ui = UiParams {
        name: name.clone(),
        piece_length: PieceLength::Auto,
        private: false,
        set_creation_date: true,
        trackers_text: tracker,
        web_seeds_text: String::new(),
        comment: String::new(),
        source: String::new(),
    };

    let worker_count = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
    let engine = Engine::new(worker_count);

    let mut callbacks = ProgressCallbacks {
        on_bytes_read: &mut |n| log::trace!(target: "demo_create_torrent", "read {n} bytes"),
        on_bytes_hashed: &mut |n| log::trace!(target: "demo_create_torrent", "hashed {n} bytes"),
        on_file_open: &mut |path| log::debug!(target: "demo_create_torrent", "opening {path}"),
    };

    let built = engine
        .build(&files, single_file, &ui, None, &mut callbacks)
        .expect("build failed")
        .expect("build was not cancelled (no job id was ever superseded)");

    let out_name = format!("{name}.torrent");
    std::fs::write(&out_name, &built.bytes).expect("failed to write torrent file");

    println!("wrote {out_name} (info-hash {})", built.info_hash);
}
