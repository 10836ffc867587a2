use anyhow::Result;
use cwhisper_core::recommendation::{Customization, ListAvailableCustomizationsRequest};

use super::common;
use crate::output::{OutputFormat, write_json, write_table};

pub async fn run(output: OutputFormat) -> Result<()> {
    let client = common::client().await?;
    let mut customizations: Vec<Customization> = Vec::new();
    let mut request = ListAvailableCustomizationsRequest {
        profile_arn: client.active_profile_arn(),
        ..Default::default()
    };

    loop {
        let page = client.list_available_customizations(&request).await?;
        customizations.extend(page.customizations);
        match common::next_page(request.next_token.as_deref(), page.next_token) {
            Some(token) => request.next_token = Some(token),
            None => break,
        }
    }

    match output {
        OutputFormat::Json => write_json(&mut std::io::stdout(), &customizations),
        OutputFormat::Table => {
            let rows = customizations
                .into_iter()
                .map(|c| {
                    vec![
                        c.name.unwrap_or_default(),
                        c.arn,
                        c.description.unwrap_or_default(),
                    ]
                })
                .collect();
            write_table(&mut std::io::stdout(), &["name", "arn", "description"], rows)
        }
    }
}
