use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use otp_isochrone::isochrone::Location;
use otp_isochrone::otp::{IsochroneRequest, OpenTripPlanner, OtpConfig};
use otp_isochrone::transport::{HttpConfig, HttpTransport};

const USAGE: &str = "usage: otp-isochrone <lat,lon> <interval-secs>... [--dry-run]";

/// Parse `"lat,lon"` into a location.
fn parse_location(s: &str) -> Option<Location> {
    let (lat, lon) = s.split_once(',')?;
    Some(Location::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

/// Build the request from command-line arguments (without the program name).
fn parse_args(args: &[String]) -> Result<IsochroneRequest, String> {
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let mut positional = args.iter().filter(|a| a.as_str() != "--dry-run");

    let location = positional
        .next()
        .ok_or_else(|| USAGE.to_string())
        .and_then(|s| parse_location(s).ok_or_else(|| format!("invalid location: {s}")))?;

    let intervals = positional
        .map(|s| s.parse::<u32>().map_err(|_| format!("invalid interval: {s}")))
        .collect::<Result<Vec<_>, _>>()?;

    if intervals.is_empty() {
        return Err(USAGE.to_string());
    }

    Ok(IsochroneRequest::new(location, intervals).with_dry_run(dry_run))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut request = match parse_args(&args) {
        Ok(request) => request,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    if let Ok(mode) = std::env::var("OTP_MODE") {
        request = request.with_profile(mode);
    }

    let base_url =
        std::env::var("OTP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let router_id = std::env::var("OTP_ROUTER_ID").unwrap_or_else(|_| "default".to_string());

    let transport = match HttpTransport::new(HttpConfig::new(base_url)) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Failed to create transport: {e}");
            return ExitCode::FAILURE;
        }
    };
    let otp = OpenTripPlanner::with_config(transport, OtpConfig::new(router_id));

    let isochrones = match otp.isochrones(&request).await {
        Ok(isochrones) => isochrones,
        Err(e) => {
            eprintln!("Isochrone request failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(isochrones.isochrones()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_location_and_intervals() {
        let request = parse_args(&args(&["52.5,13.4", "600", "1200"])).unwrap();
        assert_eq!(request.location, Location::new(52.5, 13.4));
        assert_eq!(request.intervals, vec![600, 1200]);
        assert!(!request.dry_run);
    }

    #[test]
    fn dry_run_flag_anywhere() {
        let request = parse_args(&args(&["--dry-run", "52.5, 13.4", "600"])).unwrap();
        assert!(request.dry_run);
        assert_eq!(request.intervals, vec![600]);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_args(&args(&[])).unwrap_err(), USAGE);
        assert!(parse_args(&args(&["52.5"])).is_err());
        assert!(parse_args(&args(&["52.5,13.4", "ten"])).is_err());
        assert_eq!(parse_args(&args(&["52.5,13.4"])).unwrap_err(), USAGE);
        assert_eq!(
            parse_args(&args(&["52.5,13.4", "--dry-run"])).unwrap_err(),
            USAGE
        );
    }
}
