mod command;
mod schema;

fn main() -> anyhow::Result<()> {
    command::run()
}
