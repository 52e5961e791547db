pub mod a001_conversation;
