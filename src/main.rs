//! Photoprint CLI
//!
//! Prices a cart against a settings snapshot and prints the receipt, or
//! submits it as an order when a checkout form is given.

use std::io::{self, Write};

use anyhow::Context;
use tracing::info;

use photoprint::{
    cart::Cart,
    orders::{OrderRequest, OrderSubmission},
    settings::SettingsSnapshot,
};

use crate::config::{AppConfig, OutputFormat};

mod config;
mod observability;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().unwrap_or_else(|err| err.exit());

    observability::init_subscriber(&config.logging)?;

    let pricing = &config.pricing;
    let time_zone = pricing.time_zone().context("unknown time zone")?;
    let now = pricing.now();

    let snapshot = SettingsSnapshot::from_path(&pricing.settings, &time_zone)
        .with_context(|| format!("failed to load settings from {}", pricing.settings.display()))?;

    let cart = Cart::from_path(&pricing.cart)
        .with_context(|| format!("failed to load cart from {}", pricing.cart.display()))?;

    if let Some(banner) = snapshot.promotion_banner(now) {
        info!(banner, "promotion in effect");
    }

    let mut out = io::stdout().lock();

    match &pricing.order {
        Some(path) => {
            let request = OrderRequest::from_path(path)
                .with_context(|| format!("failed to load order from {}", path.display()))?;

            let order = OrderSubmission::submit(
                request.contact_info,
                request.processing_options,
                cart.into_items(),
                &snapshot,
                now,
                &mut rand::thread_rng(),
            )?;

            match pricing.output {
                OutputFormat::Table => write!(out, "{}", order.details(&time_zone))?,
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut out, &order.to_record())?;
                    writeln!(out)?;
                }
            }
        }
        None => {
            let breakdown = snapshot.price(cart.items(), now)?;

            match pricing.output {
                OutputFormat::Table => breakdown.write_to(&mut out, cart.items(), &snapshot.catalog)?,
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut out, &breakdown.to_record())?;
                    writeln!(out)?;
                }
            }
        }
    }

    Ok(())
}
