use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Install the process-wide logger. `RUST_LOG` still wins over `level`.
pub fn init(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_env(Env::default())
        .init();
}
