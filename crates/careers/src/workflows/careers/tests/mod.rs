mod common;
mod quota;
mod routing;
