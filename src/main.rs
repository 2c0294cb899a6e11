use file_logger::app::{self, formatter};
use std::io::Write;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let message = record.args().to_string();
            writeln!(
                buf,
                "{}",
                formatter::log_line(chrono::Local::now().time(), &message)
            )
        })
        .init();

    if let Err(err) = app::run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
