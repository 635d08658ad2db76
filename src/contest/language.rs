use crate::{contest::store::Language, errors};

/// Picks the judge language code for a submission.
///
/// An explicit language always wins and must be one of the contest's codes. Otherwise the
/// language is guessed from whatever follows the last dot of the file name. Code read from
/// standard input carries no name, so it needs an explicit language.
pub fn resolve(
    explicit: Option<&str>,
    filename: Option<&str>,
    languages: &[Language],
) -> Result<String, errors::Error> {
    if let Some(code) = explicit {
        return by_code(code, languages);
    }
    match filename {
        Some(filename) => by_filename(filename, languages),
        None => Err(errors::LanguageRequired),
    }
}

pub fn by_code(code: &str, languages: &[Language]) -> Result<String, errors::Error> {
    languages
        .iter()
        .find(|language| language.code == code)
        .map(|language| language.code.clone())
        .ok_or_else(|| errors::UnsupportedLanguage(code.to_string()))
}

pub fn by_filename(filename: &str, languages: &[Language]) -> Result<String, errors::Error> {
    let (_, extension) = filename
        .rsplit_once('.')
        .ok_or_else(|| errors::NoExtension(filename.to_string()))?;

    languages
        .iter()
        .find(|language| language.extensions.iter().any(|ext| ext == extension))
        .map(|language| language.code.clone())
        .ok_or_else(|| errors::UnsupportedExtension(extension.to_string()))
}
