use crate::app::DrawingApp;

pub fn central_panel(app: &mut DrawingApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            // Drawing area fills whatever the tool bar leaves
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());

            app.handle_input(ctx, &response);
            app.render_canvas(&painter, response.rect);
        });
}
