//! Bulk lead import and bulk lead / activity extract jobs.
//!
//! These operations live under `/bulk/v1`, so they are only useful on a
//! client built with `ClientConfig::bulk(true)`.

use std::path::Path;

use crate::client::MarketoClient;
use crate::command::{Attachment, Command, Params};
use crate::error::MarketoError;
use crate::operation::{self, Operation};
use crate::types::{ApiResponse, ExportJob, ImportBatch};

/// The two extract job families Marketo offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extract {
    Leads,
    Activities,
}

impl Extract {
    fn create(self) -> &'static Operation {
        match self {
            Extract::Leads => &operation::CREATE_BULK_LEAD_EXTRACT_JOB,
            Extract::Activities => &operation::CREATE_BULK_ACTIVITIES_EXTRACT_JOB,
        }
    }

    fn enqueue(self) -> &'static Operation {
        match self {
            Extract::Leads => &operation::ENQUEUE_BULK_LEAD_EXTRACT_JOB,
            Extract::Activities => &operation::ENQUEUE_BULK_ACTIVITIES_EXTRACT_JOB,
        }
    }

    fn status(self) -> &'static Operation {
        match self {
            Extract::Leads => &operation::GET_BULK_LEAD_EXTRACT_JOB_STATUS,
            Extract::Activities => &operation::GET_BULK_ACTIVITIES_EXTRACT_JOB_STATUS,
        }
    }

    fn results(self) -> &'static Operation {
        match self {
            Extract::Leads => &operation::GET_BULK_LEAD_EXTRACT_JOB_RESULTS,
            Extract::Activities => &operation::GET_BULK_ACTIVITIES_EXTRACT_JOB_RESULTS,
        }
    }
}

impl MarketoClient {
    /// `options` carries the job definition: `format`, `fields`,
    /// `columnHeaderNames`, `filter`.
    pub fn create_bulk_lead_extract_job(&self, options: Params) -> Command<ApiResponse<ExportJob>> {
        Command::new(Extract::Leads.create(), options)
    }

    pub fn enqueue_bulk_lead_extract_job(&self, export_id: &str) -> Result<Command<ApiResponse<ExportJob>>, MarketoError> {
        Ok(Command::new(Extract::Leads.enqueue(), export_params(export_id)?))
    }

    pub fn get_bulk_lead_extract_job_status(&self, export_id: &str) -> Result<Command<ApiResponse<ExportJob>>, MarketoError> {
        Ok(Command::new(Extract::Leads.status(), export_params(export_id)?))
    }

    /// The extracted file, returned as-is.
    pub fn get_bulk_lead_extract_job_results(&self, export_id: &str) -> Result<Command<String>, MarketoError> {
        Ok(Command::file(Extract::Leads.results(), export_params(export_id)?))
    }

    /// `options` carries the job definition: `format`, `fields`,
    /// `columnHeaderNames`, `filter`.
    pub fn create_bulk_activities_extract_job(&self, options: Params) -> Command<ApiResponse<ExportJob>> {
        Command::new(Extract::Activities.create(), options)
    }

    pub fn enqueue_bulk_activities_extract_job(
        &self,
        export_id: &str,
    ) -> Result<Command<ApiResponse<ExportJob>>, MarketoError> {
        Ok(Command::new(Extract::Activities.enqueue(), export_params(export_id)?))
    }

    pub fn get_bulk_activities_extract_job_status(
        &self,
        export_id: &str,
    ) -> Result<Command<ApiResponse<ExportJob>>, MarketoError> {
        Ok(Command::new(Extract::Activities.status(), export_params(export_id)?))
    }

    /// The extracted file, returned as-is.
    pub fn get_bulk_activities_extract_job_results(&self, export_id: &str) -> Result<Command<String>, MarketoError> {
        Ok(Command::file(Extract::Activities.results(), export_params(export_id)?))
    }

    /// Import leads from a file on disk. `format` defaults to `csv`;
    /// `lookupField`, `listId` and `partitionName` may be passed in `options`.
    pub fn import_leads_csv(&self, file: &Path, options: Params) -> Result<Command<ApiResponse<ImportBatch>>, MarketoError> {
        let contents = std::fs::read(file)
            .map_err(|e| MarketoError::invalid(format!("cannot read file {}: {e}", file.display())))?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("leads.csv");
        self.import_leads(file_name, contents, options)
    }

    /// Import leads from in-memory file contents, sent byte for byte.
    pub fn import_leads(
        &self,
        file_name: &str,
        contents: impl Into<Vec<u8>>,
        options: Params,
    ) -> Result<Command<ApiResponse<ImportBatch>>, MarketoError> {
        let contents = contents.into();
        if contents.trim_ascii().is_empty() {
            return Err(MarketoError::invalid("import file is empty"));
        }
        let mut params = options;
        let format = params
            .get("format")
            .and_then(|f| f.as_str())
            .filter(|f| !f.is_empty())
            .unwrap_or("csv")
            .to_string();
        let content_type = match format.as_str() {
            "tsv" => "text/tab-separated-values",
            "ssv" => "text/plain",
            _ => "text/csv",
        };
        params.insert("format".into(), format.into());

        let attachment = Attachment {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            contents,
        };
        Ok(Command::new(&operation::IMPORT_LEADS_CSV, params).attach(attachment))
    }

    pub fn get_bulk_upload_status(&self, batch_id: i64) -> Result<Command<ApiResponse<ImportBatch>>, MarketoError> {
        Ok(Command::new(&operation::GET_BULK_UPLOAD_STATUS, batch_params(batch_id)?))
    }

    /// Rows that failed to import, as the CSV file Marketo returns.
    pub fn get_bulk_upload_failures(&self, batch_id: i64) -> Result<Command<String>, MarketoError> {
        Ok(Command::file(&operation::GET_BULK_UPLOAD_FAILURES, batch_params(batch_id)?))
    }

    /// Rows imported with warnings, as the CSV file Marketo returns.
    pub fn get_bulk_upload_warnings(&self, batch_id: i64) -> Result<Command<String>, MarketoError> {
        Ok(Command::file(&operation::GET_BULK_UPLOAD_WARNINGS, batch_params(batch_id)?))
    }
}

fn export_params(export_id: &str) -> Result<Params, MarketoError> {
    if export_id.trim().is_empty() {
        return Err(MarketoError::invalid("missing exportId"));
    }
    let mut params = Params::new();
    params.insert("exportId".into(), export_id.into());
    Ok(params)
}

fn batch_params(batch_id: i64) -> Result<Params, MarketoError> {
    if batch_id <= 0 {
        return Err(MarketoError::invalid(format!("invalid batchId {batch_id}")));
    }
    let mut params = Params::new();
    params.insert("batchId".into(), batch_id.into());
    Ok(params)
}
