mod cli;
mod helpers;
mod hook_run;
mod install;
mod shared;
