//! Write a small deterministic sample dataset (CSV sheet directory) for
//! trying the pipeline without the real source workbook.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

struct SampleProject {
    number: u32,
    name: &'static str,
    country: &'static str,
    status: &'static str,
    technology: &'static str,
    announced_size: &'static str,
    date_online: &'static str,
    capacity_kt_y: &'static str,
    normalized_capacity: &'static str,
}

// raw-looking rows: synonym statuses and blanks survive until cleaning
const PROJECTS: &[SampleProject] = &[
    SampleProject { number: 1, name: "Aurora H2", country: "NOR", status: "Operational", technology: "ALK", announced_size: "20", date_online: "2021-06-01", capacity_kt_y: "10.0", normalized_capacity: "1200" },
    SampleProject { number: 2, name: "Fjord Green", country: "NOR", status: "FID", technology: "PEM", announced_size: "50-100", date_online: "2025-03-01", capacity_kt_y: "25.5", normalized_capacity: "800.5" },
    SampleProject { number: 3, name: "Outback Hydrogen", country: "AUS", status: "FID/Construction", technology: "ALK", announced_size: "", date_online: "", capacity_kt_y: "40.0", normalized_capacity: "2100" },
    SampleProject { number: 4, name: "Pilbara Sun", country: "AUS", status: "Operational", technology: "PEM", announced_size: "300", date_online: "2020-01-15", capacity_kt_y: "0.0", normalized_capacity: "" },
    SampleProject { number: 5, name: "Atacama Wind", country: "CHL", status: "Feasibility study", technology: "SMR + CCUS", announced_size: "1.5", date_online: "", capacity_kt_y: "", normalized_capacity: "150" },
    SampleProject { number: 6, name: "Patagonia Verde", country: "CHL", status: "Unknown", technology: "ALK", announced_size: "", date_online: "", capacity_kt_y: "5.0", normalized_capacity: "300" },
    SampleProject { number: 7, name: "Rhine Valley", country: "DEU", status: "Operational", technology: "PEM", announced_size: "100", date_online: "2021-06-01", capacity_kt_y: "12.3", normalized_capacity: "950" },
    SampleProject { number: 8, name: "Baltic Shore", country: "DEU", status: "Concept", technology: "Other Electrolysis", announced_size: "", date_online: "", capacity_kt_y: "", normalized_capacity: "" },
];

const COUNTRIES: &[(&str, &str)] = &[
    ("Norway", "NOR"),
    ("Australia", "AUS"),
    ("Chile", "CHL"),
    ("Germany", "DEU"),
];

fn write_projects(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "Number",
        "Project Name",
        "Country",
        "Status",
        "Technology",
        "Announced Size",
        "Date online",
        "kt H2/y",
        "IEA zero-carbon estimated normalized capacity[nm³ H₂/hour]",
    ])?;
    for p in PROJECTS {
        writer.write_record([
            p.number.to_string().as_str(),
            p.name,
            p.country,
            p.status,
            p.technology,
            p.announced_size,
            p.date_online,
            p.capacity_kt_y,
            p.normalized_capacity,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_countries(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Country", "ISO-3 Code"])?;
    for (name, code) in COUNTRIES {
        writer.write_record([*name, *code])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = Path::new("sample_data");
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    write_projects(&out_dir.join("Projects.csv"))?;
    write_countries(&out_dir.join("Countries.csv"))?;
    info!("sample sheets written");

    println!(
        "Wrote {} projects across {} countries to {}",
        PROJECTS.len(),
        COUNTRIES.len(),
        out_dir.display()
    );
    Ok(())
}
