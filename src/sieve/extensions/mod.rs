//! Nodes defined by numbered SIEVE extensions, one module per RFC.

mod body;
mod date;
mod editheader;
mod enotify;
mod environment;
mod ihave;
mod imap4flags;
mod include;
mod mailbox;
mod reject;
mod spamtest;
mod vacation;
mod variables;

pub use body::{BodyTest, BodyTransform};
pub use date::{CurrentDateTest, DateTest, Zone};
pub use editheader::{AddHeaderCommand, DeleteHeaderCommand};
pub use enotify::{NotifyCommand, NotifyMethodCapabilityTest, ValidNotifyMethodTest};
pub use environment::EnvironmentTest;
pub use ihave::{ErrorCommand, IHaveTest};
pub use imap4flags::{FlagCommand, HasFlagTest};
pub use include::{IncludeCommand, Location};
pub use mailbox::{MailboxExistsTest, MetadataExistsTest, MetadataTest};
pub use reject::RejectCommand;
pub use spamtest::{SpamTest, VirusTest};
pub use vacation::VacationCommand;
pub use variables::{SetCommand, StringTest};
