//! seed CLI 命令：写入少量演示数据

use chrono::{TimeZone, Utc};
use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{AppServices, CreateAtrocityRequest, CreateHighlightRequest};
use crate::storage::{HighlightCategory, HighlightStatus};

fn demo_atrocities() -> Vec<CreateAtrocityRequest> {
    vec![
        CreateAtrocityRequest {
            title: "Land dispute escalates in village council meeting".to_string(),
            state: "Bihar".to_string(),
            district: Some("Gaya".to_string()),
            locality: None,
            description: "Residents reported intimidation during a council hearing on land records."
                .to_string(),
            images: Vec::new(),
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 12, 10, 0, 0).single(),
        },
        CreateAtrocityRequest {
            title: "Denial of access to public well".to_string(),
            state: "Rajasthan".to_string(),
            district: Some("Barmer".to_string()),
            locality: Some("Ward 7".to_string()),
            description: "Families were prevented from drawing water from the public well."
                .to_string(),
            images: Vec::new(),
            occurred_at: None,
        },
    ]
}

fn demo_highlights() -> Vec<CreateHighlightRequest> {
    vec![
        CreateHighlightRequest {
            title: "District hospital adds 50 beds".to_string(),
            category: HighlightCategory::Health,
            state: "Odisha".to_string(),
            district: Some("Koraput".to_string()),
            locality: None,
            status: HighlightStatus::Completed,
            description: "The new ward opened with oxygen supply for every bed.".to_string(),
            source_name: Some("District press release".to_string()),
            source_url: None,
            published_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single(),
            is_visible: true,
        },
        CreateHighlightRequest {
            title: "Rural road connectivity project".to_string(),
            category: HighlightCategory::Infrastructure,
            state: "Jharkhand".to_string(),
            district: None,
            locality: None,
            status: HighlightStatus::InProgress,
            description: "All-weather roads to connect 120 habitations.".to_string(),
            source_name: None,
            source_url: None,
            published_at: None,
            is_visible: true,
        },
    ]
}

/// 运行 seed 命令；已有内容时跳过对应部分
pub async fn seed(services: &AppServices) -> Result<(), CliError> {
    let stats = services.stats.get_stats().await?;
    println!(
        "{} Visitor stats ready (total = {})",
        "✓".green().bold(),
        stats.total_visitors
    );

    if services.atrocities.count().await? > 0 {
        println!("{} Atrocity reports already present, skipped", "-".yellow());
    } else {
        let items = demo_atrocities();
        let n = items.len();
        for req in items {
            services.atrocities.create(req, None).await?;
        }
        println!("{} Inserted {} atrocity reports", "✓".green().bold(), n);
    }

    if services.governance.count().await? > 0 {
        println!("{} Governance highlights already present, skipped", "-".yellow());
    } else {
        let items = demo_highlights();
        let n = items.len();
        for req in items {
            services.governance.create(req).await?;
        }
        println!("{} Inserted {} governance highlights", "✓".green().bold(), n);
    }

    Ok(())
}
