mod config;
mod items;
mod oracle;
mod ranking;
