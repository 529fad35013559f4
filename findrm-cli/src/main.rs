use anyhow::Result;

fn main() -> Result<()> {
    findrm_cli::run_cli()
}
