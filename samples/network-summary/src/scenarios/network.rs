use beacon_network_client::beacon::client::BeaconClient;
use beacon_network_client::beacon::table::ResultsTable;
use beacon_network_client::config::Settings;

pub async fn run(client: &BeaconClient, settings: &Settings) -> Result<(), String> {
    println!("Scenario: network ({})", settings.ui.title);

    let info = client.fetch_info().await?;
    println!(
        "API version: {}",
        info.api_version.as_deref().unwrap_or("-")
    );

    let table = ResultsTable::build(&info.items);
    for row in &table.rows {
        println!("{:<40} {:?} {}", row.beacon_id, row.kind, row.summary.display());
        for dataset in &row.datasets {
            println!("    {:<36} {}", dataset.dataset, dataset.summary.display());
        }
    }
    println!(
        "Beacons found: {}, datasets: {}, records: {}",
        table.totals.beacons_found, table.totals.datasets, table.totals.records
    );

    let terms = client.fetch_filtering_terms().await?;
    println!("Filtering terms: {}", terms.len());

    Ok(())
}
