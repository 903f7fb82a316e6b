use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Eval,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Eval, Split::Test];

    /// Offset mixed into the run seed so each split draws different samples.
    pub fn seed_offset(self) -> u64 {
        match self {
            Split::Train => 0,
            Split::Eval => 1,
            Split::Test => 2,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Split::Train => "train",
            Split::Eval => "eval",
            Split::Test => "test",
        };
        f.write_str(name)
    }
}
