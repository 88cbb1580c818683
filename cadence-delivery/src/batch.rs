use std::num::NonZeroUsize;

use cadence_common::Message;

/// A contiguous run of messages delivered over one session.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 1-indexed position among the run's batches.
    pub number: usize,
    pub messages: &'a [Message],
}

impl Batch<'_> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Split `messages` into batches of `size`, in order. Only the last batch
/// may be shorter.
pub fn batches(messages: &[Message], size: NonZeroUsize) -> impl Iterator<Item = Batch<'_>> {
    messages
        .chunks(size.get())
        .enumerate()
        .map(|(index, messages)| Batch {
            number: index + 1,
            messages,
        })
}
