pub mod client;

pub mod communicator;

pub mod config;

pub mod contest {
    pub mod language;
    pub mod listing;
    pub mod selection;
    pub mod store;
    pub mod task;
}

pub mod errors;

pub mod init;

pub mod message {
    pub mod frame;
    pub mod nullable;
    pub mod verdict;
}

pub mod rating;

pub mod report;

pub mod submission;
