mod calendar_mock;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - calendar_mock: Summary service against a mocked calendar provider
// - http_api: The summary routes served through the axum router
// - display_agent: Wake cycles against mocked network, server and panel
