use billing_recon_dashboard::*;

fn print_report(report: &DashboardReport) {
    println!(
        "\n=== carrier={} month={} ({} records) ===",
        report.carrier_selector, report.month_selector, report.record_count
    );

    for advisory in &report.advisories {
        println!("  ! {}", advisory);
    }

    for tab in &report.tabs {
        println!("\n[{}] {}", tab.title, tab.heading);
        for panel in &tab.panels {
            match panel.rows() {
                Some(rows) => println!("  - {} ({:?}, {} rows)", panel.title, panel.chart, rows.len()),
                None => println!("  - {} : no data to display for the selected filter", panel.title),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dataset = BillingDataset::with_seed(42)?;
    println!("Carrier options: {:?}", dataset.carrier_options());
    println!("Month options:   {:?}", dataset.month_options());

    let overview = build_dashboard(&dataset, "All", "All")?;
    print_report(&overview);

    if let Some(PanelRows::CarrierTotals(rows)) = overview
        .tab("Invoice Recon")
        .and_then(|t| t.panel("Disputed vs Processed Amounts by Carrier"))
        .and_then(|p| p.rows())
    {
        println!("\nDisputed vs processed by carrier:");
        for row in rows {
            println!(
                "  {:<12} invoiced ${:>10.2}  disputed ${:>9.2}",
                row.carrier_name, row.invoice_amount_usd, row.disputed_amount_usd
            );
        }
    }

    print_report(&build_dashboard(&dataset, "Carrier 1", "2024-01")?);

    match build_dashboard(&dataset, "Carrier 99", "All") {
        Ok(_) => println!("\nUnexpectedly accepted an unknown carrier"),
        Err(e) => println!("\nRejected selector: {}", e),
    }

    Ok(())
}
