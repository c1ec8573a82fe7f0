// Job description submission. Keywords are extracted once, at submission time.

pub mod handlers;
