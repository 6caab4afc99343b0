use crate::error::ClientError;
use crate::multipart::UploadFile;
use crate::page::RecordPage;
use crate::row::RecordId;

/// The three calls the view needs from the record service.
///
/// [`RecordClient`](crate::RecordClient) speaks HTTP; tests and embedders can
/// supply any other implementation.
pub trait RecordService: Send + Sync {
    fn upload(&self, file: &UploadFile) -> Result<(), ClientError>;

    /// `offset` is a page index, not a row offset.
    fn fetch_page(&self, offset: usize, size: usize) -> Result<RecordPage, ClientError>;

    fn delete_record(&self, id: &RecordId) -> Result<(), ClientError>;
}

impl<S: RecordService + ?Sized> RecordService for std::sync::Arc<S> {
    fn upload(&self, file: &UploadFile) -> Result<(), ClientError> {
        (**self).upload(file)
    }

    fn fetch_page(&self, offset: usize, size: usize) -> Result<RecordPage, ClientError> {
        (**self).fetch_page(offset, size)
    }

    fn delete_record(&self, id: &RecordId) -> Result<(), ClientError> {
        (**self).delete_record(id)
    }
}
