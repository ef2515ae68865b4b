//! Wire the appliance client into the engine's handler registry
//!
//! The registry is populated once per invocation: every kind at the
//! appliance's configured API version (under both the default entry and the
//! configured variant tag), and golden images against the image-streamer
//! appliance when one is configured.

use crate::config::Config;
use anyhow::{Context, Result};
use appliance::Appliance;
use reconcile::{HandlerRegistry, ResourceKind};

pub fn build_registry(config: &Config) -> Result<HandlerRegistry> {
    let mut registry = HandlerRegistry::new();

    let appliance = Appliance::connect(
        &config.appliance.host,
        &config.appliance.username,
        &config.appliance.password,
        config.appliance.api_version,
    )
    .with_context(|| format!("could not connect to appliance {}", config.appliance.host))?;

    for kind in ResourceKind::all() {
        if *kind == ResourceKind::GoldenImage {
            continue;
        }
        registry.register(
            *kind,
            config.appliance.api_version,
            None,
            Box::new(appliance.collection(*kind)),
        );
        if let Some(variant) = config.appliance.variant.as_deref() {
            registry.register(
                *kind,
                config.appliance.api_version,
                Some(variant),
                Box::new(appliance.collection(*kind)),
            );
        }
    }

    if let Some(streamer) = &config.image_streamer {
        let username = streamer
            .username
            .as_deref()
            .unwrap_or(&config.appliance.username);
        let password = streamer
            .password
            .as_deref()
            .unwrap_or(&config.appliance.password);
        let image_streamer =
            Appliance::connect(&streamer.host, username, password, streamer.api_version)
                .with_context(|| {
                    format!("could not connect to image streamer {}", streamer.host)
                })?;
        registry.register(
            ResourceKind::GoldenImage,
            streamer.api_version,
            None,
            Box::new(image_streamer.collection(ResourceKind::GoldenImage)),
        );
    }

    log::debug!("registered {} collection handlers", registry.len());
    Ok(registry)
}
