use crate::cli::{Cli, Command};

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.cmd {
        Command::Serve {
            data,
            bind,
            fallback_image,
            scale,
        } => {
            if cli.json {
                anyhow::bail!("--json is not supported for serve");
            }
            crate::commands::serve::cmd_serve(
                &data,
                &bind,
                fallback_image.as_deref(),
                scale,
                &cli.embedding,
            )
        }
        Command::Embed { data, criteria } => {
            crate::commands::embed::cmd_embed(&data, &criteria, &cli.embedding, cli.json)
        }
        Command::Layout {
            data,
            criteria,
            scale,
        } => crate::commands::layout::cmd_layout(&data, &criteria, scale, &cli.embedding, cli.json),
        Command::Criteria => crate::commands::criteria::cmd_criteria(cli.json),
    }
}
