#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_their_context() {
        let e = Error::Spreadsheet("mapping produced no entries".into());
        assert_eq!(e.to_string(), "Spreadsheet error: mapping produced no entries");

        let e = Error::Archive("failed to finish zip".into());
        assert_eq!(e.to_string(), "Archive error: failed to finish zip");
    }
}
