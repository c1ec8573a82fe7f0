// Resume upload and lookup. Parsing lives in `document`; the stored file goes to S3.

pub mod handlers;
