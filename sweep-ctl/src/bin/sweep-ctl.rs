use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::process;
use sweep_ctl::host_coms::KeyboardCtl;

const HID_CLASS: u8 = 3;

fn parse_hex(v: &str) -> Result<u16, String> {
    let digits = v
        .strip_prefix("0x")
        .or_else(|| v.strip_prefix("0X"))
        .unwrap_or(v);
    u16::from_str_radix(digits, 16).map_err(|_| format!("Invalid hex number: {v}"))
}

/// Talk to a sweep keyboard over its raw HID interface
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// The USB vendor_id of the device to find in 4 hex digits
    #[clap(long, short, value_parser = parse_hex)]
    vendor_id: Option<u16>,
    /// The USB product_id of the device to find in 4 hex digits
    #[clap(long, short, value_parser = parse_hex)]
    product_id: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// List matching USB devices
    List,
    /// Print the highest active layer
    Layer,
    /// Make a layer the only active one
    SetLayer {
        /// Layer number, 0 to 3
        layer: u8,
    },
}

fn has_raw_hid(dev: &nusb::DeviceInfo) -> bool {
    dev.interfaces()
        .any(|i| i.class() == HID_CLASS && i.subclass() == 0 && i.protocol() == 0)
}

fn iter_keyboards(cli: &Cli) -> Result<impl Iterator<Item = nusb::DeviceInfo> + use<'_>> {
    let vendor_id = cli.vendor_id;
    let product_id = cli.product_id;
    Ok(nusb::list_devices()?.filter(move |d| {
        vendor_id.is_none_or(|id| d.vendor_id() == id)
            && product_id.is_none_or(|id| d.product_id() == id)
            && has_raw_hid(d)
    }))
}

fn list(cli: &Cli) -> Result<()> {
    println!("Keyboards:");
    for dev in iter_keyboards(cli)? {
        println!(
            "Device: {:03}.{:03}, Id: {:04x}:{:04x}, Name: {} - {}",
            dev.bus_number(),
            dev.device_address(),
            dev.vendor_id(),
            dev.product_id(),
            dev.manufacturer_string().unwrap_or(""),
            dev.product_string().unwrap_or(""),
        );
    }

    println!();
    Ok(())
}

fn get_keyboard(cli: &Cli) -> Result<KeyboardCtl<nusb::Interface>> {
    let Some(info) = iter_keyboards(cli)?.next() else {
        let any = |id: Option<u16>| id.map_or("any".to_owned(), |n| format!("{n:04x}"));
        return Err(anyhow!(
            "No matching usb device found!\n  vendor_id: {}, product_id: {}",
            any(cli.vendor_id),
            any(cli.product_id)
        ));
    };
    log::info!(
        "using {:04x}:{:04x} at {:03}.{:03}",
        info.vendor_id(),
        info.product_id(),
        info.bus_number(),
        info.device_address()
    );
    let dev = info.open()?;
    KeyboardCtl::find_raw_hid_interface(&dev)
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List => list(cli),
        Commands::Layer => {
            let layer = get_keyboard(cli)?.get_layer()?;
            println!("{layer}");
            Ok(())
        }
        Commands::SetLayer { layer } => get_keyboard(cli)?.set_layer(*layer),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_ids() {
        assert_eq!(parse_hex("0x1d50"), Ok(0x1d50));
        assert_eq!(parse_hex("FEED"), Ok(0xfeed));
        assert!(parse_hex("0xfeedd").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["sweep-ctl", "-v", "0x1d50", "set-layer", "2"]).unwrap();
        assert_eq!(cli.vendor_id, Some(0x1d50));
        assert_eq!(cli.product_id, None);
        assert!(matches!(cli.command, Commands::SetLayer { layer: 2 }));

        assert!(Cli::try_parse_from(["sweep-ctl", "set-layer"]).is_err());
    }
}
