mod helpers;
mod login;
mod logout;
mod refresh;
mod register;
mod scenario;
