use anyhow::{Result, bail};
use ovnsnap_runtime::Engine;
use ovnsnap_types::{Role, RoleFilter};

use super::args::{Cli, Commands};
use super::handlers;
use crate::context::ExecutionContext;
use crate::logging;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let ctx = ExecutionContext::new(cli.config, cli.engine.map(Engine::from), cli.format);

    match cli.command {
        Commands::Run { clean: true, .. } => handlers::clean::handle(&ctx),

        Commands::Run {
            db_dir: Some(db_dir),
            role,
            image,
            script_path,
            legacy,
            ..
        } => handlers::run::handle(
            &ctx,
            &db_dir,
            role.map(RoleFilter::from),
            image,
            script_path,
            &legacy,
        ),

        Commands::Run { db_dir: None, .. } => bail!("a database directory is required"),

        Commands::Clean => handlers::clean::handle(&ctx),

        Commands::Shell {
            db_file,
            role,
            image,
        } => handlers::shell::handle(&ctx, &db_file, role.map(Role::from), image),

        Commands::Scan { db_dir, role } => {
            handlers::scan::handle(&ctx, &db_dir, role.map(RoleFilter::from).unwrap_or_default())
        }

        Commands::Status => handlers::status::handle(&ctx),
    }
}
