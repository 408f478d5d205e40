//! Prescription commands.

use std::path::PathBuf;

use clap::Subcommand;

use medicart_client::GatewayError;

use crate::context::Context;

#[derive(Subcommand)]
pub enum PrescriptionAction {
    /// List the current user's prescriptions
    List,
    /// Upload a prescription file (5 MiB limit)
    Upload {
        /// File to upload
        file: PathBuf,
    },
    /// Download a prescription's file
    Download {
        /// Prescription id
        id: String,

        /// Output path (defaults to the stored file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(action: PrescriptionAction, ctx: &Context) -> Result<(), GatewayError> {
    match action {
        PrescriptionAction::List => {
            let prescriptions = ctx.client().list_prescriptions().await?;
            println!("{:<38} {:<30} {:>10} {:<20}", "ID", "FILE", "SIZE", "UPLOADED");
            for prescription in &prescriptions {
                println!(
                    "{:<38} {:<30} {:>10} {:<20}",
                    prescription.id.as_deref().unwrap_or("-"),
                    prescription.file_name.as_deref().unwrap_or("-"),
                    prescription
                        .file_size
                        .map_or_else(|| "-".to_owned(), |s| s.to_string()),
                    prescription.uploaded_date.as_deref().unwrap_or("-"),
                );
            }
            println!("{} prescriptions", prescriptions.len());
        }
        PrescriptionAction::Upload { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|e| GatewayError::InvalidInput(format!("cannot read {}: {e}", file.display())))?;
            let file_name = file
                .file_name()
                .map_or_else(|| "prescription".to_owned(), |n| n.to_string_lossy().into_owned());

            let response = ctx.client().upload_prescription(&file_name, bytes).await?;
            println!(
                "{} (id {})",
                response.message.unwrap_or_else(|| "Uploaded".to_owned()),
                response.id.unwrap_or_default(),
            );
        }
        PrescriptionAction::Download { id, output } => {
            let bytes = ctx.client().download_prescription(&id).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(format!("prescription_{id}")));
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| GatewayError::InvalidInput(format!("cannot write {}: {e}", path.display())))?;
            println!("Saved {} bytes to {}", bytes.len(), path.display());
        }
    }
    Ok(())
}
