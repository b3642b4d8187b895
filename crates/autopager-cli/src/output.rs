use autopager_domain::RenderItem;
use serde::Serialize;

use crate::session::SessionReport;

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn output_success<T: Serialize>(data: T) -> anyhow::Result<()> {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Outputs an error response to stderr and exits with code 1.
pub fn output_error(message: &str) -> ! {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
    };
    match serde_json::to_string(&response) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", message),
    }
    std::process::exit(1);
}

/// Plain rendering of the final list, one row per line.
pub fn output_text(report: &SessionReport) {
    for item in report.rows.iter() {
        match item {
            RenderItem::Element(row) => println!("  {}", row),
            RenderItem::Gap(target) => println!("  [gap: load page {}]", target),
            RenderItem::Footer => println!("  [more]"),
            RenderItem::End => println!("  [end]"),
        }
    }

    let pages = report
        .pages
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(",");
    println!(
        "pages: {} | rows: {} | elements: {} | requests: {} | failures: {}",
        pages,
        report.rows.len(),
        report.element_count,
        report.requests.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("failed page {}: {}", failure.index, failure.message);
    }
}
