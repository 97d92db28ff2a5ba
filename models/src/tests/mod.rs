mod health;
mod payloads;
