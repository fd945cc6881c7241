// src/main.rs
use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    vitrine::run()
}
