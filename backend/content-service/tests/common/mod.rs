pub mod mock_platform;
