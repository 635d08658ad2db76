/// One message pushed by the judge while a submission is being judged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Free-form status text, shown to the user as is
    Progress(String),
    /// A JSON object; always the last frame of a stream
    Terminal(Vec<u8>),
}

impl Frame {
    /// Anything that opens a JSON object is the verdict, everything else is progress text.
    /// Empty frames carry nothing and yield `None`.
    pub fn classify(data: Vec<u8>) -> Option<Frame> {
        match data.first() {
            None => None,
            Some(b'{') => Some(Frame::Terminal(data)),
            Some(_) => Some(Frame::Progress(
                String::from_utf8(data)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
            )),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Frame::Terminal(_))
    }
}
