mod valid_lima_socket_path;

pub use valid_lima_socket_path::ValidLimaSocketPath;
