use anyhow::Context;
use surreal::{AppConfig, Application, Connection};

fn main() -> anyhow::Result<()> {
    surreal::init_logging();

    let connection = Connection::desktop().context("could not reach the display")?;
    Application::new(AppConfig::default())
        .run(connection, &mut ())
        .context("could not start the application")?;

    Ok(())
}
