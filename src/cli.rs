use crate::config::AppConfigOverrides;
use crate::plot::NavigationModel;
use anyhow::{anyhow, bail, Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<f64>,
    surface: Option<NavigationModel>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Use --width/--height/--fps/--surface with values.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "width" => {
                    overrides.width =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid width '{value}'"))?);
                }
                "height" => {
                    overrides.height =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid height '{value}'"))?);
                }
                "fps" => {
                    let fps = value.parse::<f64>().with_context(|| format!("Invalid fps '{value}'"))?;
                    if !(fps.is_finite() && fps > 0.0) {
                        bail!("Invalid fps '{value}'. Use a positive frame rate.");
                    }
                    overrides.fps = Some(fps);
                }
                "surface" => {
                    overrides.surface = Some(value.parse::<NavigationModel>().map_err(|err| anyhow!(err))?);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --width, --height, --fps, --surface."),
            }
        }
        Ok(overrides)
    }

    pub fn surface(&self) -> Option<NavigationModel> {
        self.surface
    }

    pub fn into_config_overrides(self) -> AppConfigOverrides {
        AppConfigOverrides { width: self.width, height: self.height, fps: self.fps }
    }
}
