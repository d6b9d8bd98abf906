use beacon_network_client::beacon::client::{BeaconClient, SearchQuery};
use beacon_network_client::beacon::table::DetailView;
use beacon_network_client::config::Settings;

pub async fn run(client: &BeaconClient, settings: &Settings) -> Result<(), String> {
    let Some(entry_type) = settings.entry_types.first() else {
        println!("Scenario: search skipped, no entry types configured");
        return Ok(());
    };
    println!("Scenario: search {}", entry_type);

    let filters = settings
        .common_filters
        .filter_categories
        .first()
        .map(|category| {
            settings
                .filters_for(category)
                .iter()
                .take(1)
                .map(|label| label.key.clone())
                .collect::<Vec<String>>()
        })
        .unwrap_or_default();

    let query = SearchQuery {
        filters,
        limit: Some(1),
        ..Default::default()
    };
    let results = client.search(entry_type, &query).await?;

    let first_record = results
        .items
        .iter()
        .flat_map(|item| item.items.iter())
        .find_map(|dataset| dataset.results.as_ref()?.first().cloned());

    match first_record {
        Some(record) => {
            let view = DetailView::from_record(&record);
            println!("Record {}", view.title);
            for field in &view.fields {
                println!("  {}: {}", field.label, field.text.replace('\n', "\n    "));
            }
        }
        None => println!("No record-level results"),
    }

    Ok(())
}
