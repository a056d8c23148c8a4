use plot_navigator::cli::CliOverrides;
use plot_navigator::run_with_overrides;
use plot_navigator::NavigationModel;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    let surface = cli.surface().unwrap_or(NavigationModel::Rect2D);
    if let Err(err) = run_with_overrides(cli.into_config_overrides(), surface) {
        tracing::error!("Application error: {err:?}");
        std::process::exit(1);
    }
}
